mod hotp;
